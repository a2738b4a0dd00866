//! Built-in Go/beego source templates.
//!
//! Placeholders:
//! - model: `modelStruct`, `modelName`, `tableName`, `pkgPath`, `timePkg`,
//!   `importTimePkg`
//! - controller: `ctrlName`, `pkgPath`
//! - router: `nameSpaces`, `pkgPath`; each namespace: `nameSpace`, `ctrlName`

/// Model with full CRUD helpers, for tables with a primary key.
pub const MODEL_TEMPLATE: &str = r#"package models

import (
	"errors"
	"reflect"
	{{timePkg}}

	"github.com/qasico/beego/helper"
	"github.com/qasico/beego/orm"
)

{{modelStruct}}

func (t *{{modelName}}) TableName() string {
	return "{{tableName}}"
}

func init() {
	orm.RegisterModel(new({{modelName}}))
}

func Add{{modelName}}(m *{{modelName}}) (id int64, err error) {
	o := orm.NewOrm()
	id, err = o.Insert(m)
	return
}

func Get{{modelName}}ById(id int) (v *{{modelName}}, err error) {
	var m {{modelName}}
	o := orm.NewOrm()

	if err = o.QueryTable(new({{modelName}})).Filter("id", id).RelatedSel().One(&m); err == nil {
		return &m, nil
	}

	return nil, err
}

func GetAll{{modelName}}(query map[int]map[string]string, fields []string, groupby []string, sortby []string, order []string,
	offset int64, limit int64, join []string) (result []interface{}, total int64, err error) {

	o := orm.NewOrm()
	qs := o.QueryTable(new({{modelName}})).SetCond(helper.QueryCondition(query))

	if helper.IsJoin(join) {
		qs = qs.RelatedSel(helper.QueryJoin(join))
	}

	if len(sortby) != len(order) && len(order) != 1 {
		return nil, total, errors.New("'sortby', 'order' sizes mismatch or 'order' size is not 1")
	}

	qs = qs.OrderBy(helper.SetSorting(sortby, order)...).GroupBy(groupby...)

	total, err = qs.Count()
	if err != nil || total == 0 {
		return nil, total, err
	}

	var l []{{modelName}}
	if _, err := qs.Limit(limit, offset).All(&l, fields...); err != nil {
		return nil, total, err
	}

	for _, v := range l {
		if len(fields) == 0 {
			result = append(result, v)
			continue
		}
		m := make(map[string]interface{})
		val := reflect.ValueOf(v)
		for _, fname := range fields {
			m[fname] = val.FieldByName(helper.CamelString(fname)).Interface()
		}
		result = append(result, m)
	}

	return result, total, nil
}

func Update{{modelName}}ById(m *{{modelName}}, keys []string) (err error) {
	_, err = orm.NewOrm().Update(m, keys...)
	return
}

func Delete{{modelName}}(m *{{modelName}}) (err error) {
	if num, _ := orm.NewOrm().Delete(m); num == 0 {
		return errors.New("data not exists")
	}

	return
}
"#;

/// Read-only model for tables without a usable primary key.
pub const READ_ONLY_MODEL_TEMPLATE: &str = r#"package models

import (
	{{timePkg}}

	"github.com/qasico/beego/orm"
)

{{modelStruct}}

func GetAll{{modelName}}() (ml []interface{}, err error, total int64) {
	var m []{{modelName}}

	o := orm.NewOrm()
	if total, err = o.Raw("SELECT * FROM {{tableName}}").QueryRows(&m); err == nil {
		for _, v := range m {
			ml = append(ml, v)
		}
	}

	return ml, err, total
}
"#;

/// CRUD controller for one model.
pub const CONTROLLER_TEMPLATE: &str = r#"package controllers

import (
	"encoding/json"
	"strconv"

	"{{pkgPath}}/models"

	"github.com/qasico/beego"
	"github.com/qasico/beego/helper"
)

type {{ctrlName}}Controller struct {
	beego.Controller
}

func (c *{{ctrlName}}Controller) URLMapping() {
	c.Mapping("Post", c.Post)
	c.Mapping("GetOne", c.GetOne)
	c.Mapping("GetAll", c.GetAll)
	c.Mapping("Put", c.Put)
	c.Mapping("Delete", c.Delete)
}

// @Title Create new data
// @Success 200 {int} models.{{ctrlName}}
// @Failure 403 body is empty
// @router / [post]
func (c *{{ctrlName}}Controller) Post() {
	var v models.{{ctrlName}}
	var response helper.APIResponse

	if err := json.Unmarshal(c.Ctx.Input.RequestBody, &v); err == nil {
		if valid := response.Validator(&v); valid {
			if _, err := models.Add{{ctrlName}}(&v); err == nil {
				response.Success(1, v)
			} else {
				response.Failed(400, err.Error())
			}
		}
	} else {
		response.Failed(400, err.Error())
	}

	c.Ctx.Output.SetStatus(response.Code)
	c.Data["json"] = response.GetResponse("POST")
	c.ServeJSON()
}

// @Title Get single data with provided id
// @Success 200 {object} models.{{ctrlName}}
// @Failure 403 :id is empty
// @router /:id [get]
func (c *{{ctrlName}}Controller) GetOne() {
	response := helper.APIResponse{}

	id, _ := strconv.Atoi(c.Ctx.Input.Param(":id"))
	if data, err := models.Get{{ctrlName}}ById(id); err == nil {
		response.Success(1, data)
	} else {
		response.Failed(404, err.Error())
	}

	c.Ctx.Output.SetStatus(response.Code)
	c.Data["json"] = response.GetResponse("GET")
	c.ServeJSON()
}

// @Title Get data with parameters query string
// @Success 200 {object} models.{{ctrlName}}
// @Failure 403
// @router / [get]
func (c *{{ctrlName}}Controller) GetAll() {
	response := helper.APIResponse{}

	if data, total, err := models.GetAll{{ctrlName}}(helper.QueryString(c.Input())); err == nil {
		response.Success(total, data)
	} else {
		response.Failed(400, err.Error())
	}

	c.Ctx.Output.SetStatus(response.Code)
	c.Data["json"] = response.GetResponse("GET")
	c.ServeJSON()
}

// @Title Update model with provided key and new values
// @Success 200 {object} models.{{ctrlName}}
// @Failure 403 :id is not int
// @router /:id [put]
func (c *{{ctrlName}}Controller) Put() {
	response := helper.APIResponse{}

	id, _ := strconv.Atoi(c.Ctx.Input.Param(":id"))
	v := models.{{ctrlName}}{Id: id}
	if err := json.Unmarshal(c.Ctx.Input.RequestBody, &v); err == nil {
		keys := helper.GetInputKeys(c.Ctx.Input.RequestBody)
		if valid := response.Validator(&v); valid {
			if err := models.Update{{ctrlName}}ById(&v, keys); err == nil {
				response.Success(0, nil)
			} else {
				response.Failed(404, err.Error())
			}
		}
	} else {
		response.Failed(400, err.Error())
	}

	c.Ctx.Output.SetStatus(response.Code)
	c.Data["json"] = response.GetResponse("PUT")
	c.ServeJSON()
}

// @Title Delete model with provided id
// @Success 200 {string} delete success!
// @Failure 403 id is empty
// @router /:id [delete]
func (c *{{ctrlName}}Controller) Delete() {
	response := helper.APIResponse{}

	id, _ := strconv.Atoi(c.Ctx.Input.Param(":id"))
	v := models.{{ctrlName}}{Id: id}
	if err := models.Delete{{ctrlName}}(&v); err == nil {
		response.Success(0, nil)
	} else {
		response.Failed(404, err.Error())
	}

	c.Ctx.Output.SetStatus(response.Code)
	c.Data["json"] = response.GetResponse("DELETE")
	c.ServeJSON()
}
"#;

/// Route registration for all controllers.
pub const ROUTER_TEMPLATE: &str = r#"// @APIVersion 1.0.0
// @Title Application API
// @Description application api
package routers

import (
	"{{pkgPath}}/controllers"

	"github.com/qasico/beego"
)

func init() {
	ns := beego.NewNamespace("/v1",{{nameSpaces}}
	)
	beego.AddNamespace(ns)
}
"#;

/// One namespace entry of the router.
pub const NAMESPACE_TEMPLATE: &str = r#"
		beego.NSNamespace("/{{nameSpace}}",
			beego.NSInclude(
				&controllers.{{ctrlName}}Controller{},
			),
		),"#;
